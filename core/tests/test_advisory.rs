use elcruce_core::{
    Advisor, AnalyzerConfig, ChatMessage, Conversation, Dataset, MessageRole, PlanRequest,
    StaticAdvisor,
};

fn advisor(reply: Option<&str>) -> Advisor<'static, StaticAdvisor> {
    let ds = Dataset::builtin().unwrap();
    let provider = StaticAdvisor { reply: reply.map(str::to_string) };
    Advisor::new(provider, ds, &AnalyzerConfig::default())
}

#[test]
fn chat_request_layout() {
    let a = advisor(Some("ok"));
    let history = vec![ChatMessage::user("¿Qué zapatillas?"), ChatMessage::assistant("Trail.")];
    let req = a.build_chat_request("¿Y bastones?", &history).unwrap();

    assert_eq!(req.model, "gpt-4o-mini");
    assert_eq!(req.max_tokens, 800);
    assert_eq!(req.messages.len(), 4);
    assert_eq!(req.messages[0].role, MessageRole::System);
    assert!(req.messages[0].content.contains("Tiempo límite: 15 min/km por etapa"));
    assert_eq!(&req.messages[1..3], history.as_slice());
    assert_eq!(req.messages[3], ChatMessage::user("¿Y bastones?"));
}

#[test]
fn plan_request_layout() {
    let a = advisor(Some("plan"));
    let req = a
        .build_plan_request(&PlanRequest {
            weeks: 8,
            level: "Principiante".into(),
            target_pace_min_per_km: 12.0,
        })
        .unwrap();
    assert_eq!(req.max_tokens, 1500);
    assert_eq!(req.messages.len(), 2);
    assert!(req.messages[0].content.starts_with("Información de El Cruce Saucony 2025"));
    assert!(req.messages[1].content.contains("8 semanas"));
}

#[test]
fn chat_appends_question_and_answer() {
    let a = advisor(Some("Entrena cuestas."));
    let mut conv = Conversation::new();
    let answer = a.chat(&mut conv, "¿Cómo preparo la etapa 1?");

    assert_eq!(answer, "Entrena cuestas.");
    assert_eq!(conv.len(), 2);
    assert_eq!(conv.messages()[0].role, MessageRole::User);
    assert_eq!(conv.messages()[1], ChatMessage::assistant("Entrena cuestas."));
}

#[test]
fn provider_failure_becomes_apology_text() {
    let a = advisor(None);
    let answer = a.ask("hola", &[]);
    assert_eq!(answer, "Error al generar respuesta: tomt svar fra modellen");

    let plan = a.training_plan(&PlanRequest {
        weeks: 4,
        level: "Avanzado".into(),
        target_pace_min_per_km: 9.0,
    });
    assert!(plan.starts_with("Error al generar plan: "));
}

#[test]
fn dataset_limit_reaches_system_prompt() {
    let ds = Dataset::builtin().unwrap();
    let a = Advisor::for_dataset(StaticAdvisor::default(), ds);
    let req = a.build_chat_request("hola", &[]).unwrap();
    assert!(req.messages[0]
        .content
        .contains(&format!("Tiempo límite: {} min/km", ds.event().time_limit_min_per_km)));
}
