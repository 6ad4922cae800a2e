//! Grensesnitt mot den eksterne tekstgenereringstjenesten.
//!
//! Kjernen bygger kun konteksttekst og meldingslister. Selve kallet går via en
//! [`AdvisoryProvider`] (prod: `OpenAiClient`, test: [`StaticAdvisor`]), og
//! alle feil derfra blir til en unnskyldningstekst her, aldri til en
//! `MetricsError`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{AdvisoryConfig, AnalyzerConfig};
use crate::dataset::{Dataset, DatasetSummary};
use crate::error::MetricsResult;
use crate::metrics::intensity;
use crate::models::{RaceEvent, StageProfile};
use crate::telemetry::{record_advisory_failure, record_advisory_request, AdvisoryKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisoryError {
    #[error("API-nøkkel mangler (miljøvariabel {0})")]
    MissingApiKey(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("transportfeil: {0}")]
    Transport(String),
    #[error("kunne ikke tolke svar: {0}")]
    Decode(String),
    #[error("tomt svar fra modellen")]
    EmptyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Samtalehistorikk eid av kalleren (én per brukerøkt).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Forespørsel i OpenAI-kompatibelt format (serialiseres direkte som body).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

pub trait AdvisoryProvider {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AdvisoryError>;
}

/// Fast svar uten nettverk. `reply: None` simulerer et tomt svar.
#[derive(Debug, Clone, Default)]
pub struct StaticAdvisor {
    pub reply: Option<String>,
}

impl AdvisoryProvider for StaticAdvisor {
    fn complete(&self, _request: &CompletionRequest) -> Result<String, AdvisoryError> {
        self.reply.clone().ok_or(AdvisoryError::EmptyResponse)
    }
}

impl<P: AdvisoryProvider + ?Sized> AdvisoryProvider for &P {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AdvisoryError> {
        (**self).complete(request)
    }
}

/// Sammendrag av alle etapper som kontekst til modellen.
pub fn stage_context(event: &RaceEvent, stages: &[StageProfile]) -> MetricsResult<String> {
    let mut ctx = format!("Información de {}:\n\n", event.name);
    for s in stages {
        ctx.push_str(&format!(
            "{}:\n- Distancia: {}km\n- Desnivel positivo: {}m\n- Intensidad: {:.1} m/km\n\
             - Inicio: {}\n- Fin: {}\n- Características: {}\n- Oasis: {} puntos\n\n",
            s.name(),
            s.distance_km(),
            s.elevation_gain_m(),
            intensity(s)?,
            s.start_label(),
            s.end_label(),
            s.notes(),
            s.hydration_count(),
        ));
    }
    Ok(ctx)
}

pub fn system_prompt(
    event: &RaceEvent,
    stages: &[StageProfile],
    limit_min_per_km: f64,
) -> MetricsResult<String> {
    Ok(format!(
        "Eres un asistente experto en trail running y entrenamiento para carreras de montaña.
Tu especialidad es ayudar a corredores a prepararse para {name}, una carrera por etapas de {n} días
en {location}.

{context}
IMPORTANTE:
- Da consejos prácticos y específicos basados en los datos de las etapas
- Considera las características únicas de cada etapa
- Sé conciso pero completo en tus respuestas
- Si preguntan sobre entrenamiento, considera los desniveles y distancias específicas
- Si preguntan sobre estrategia de carrera, usa los datos de altimetría
- Si preguntan sobre nutrición/hidratación, considera la ubicación de los oasis
- Tiempo límite: {limit} min/km por etapa
- Formato: Usa markdown para estructura (listas, negritas, etc.)
",
        name = event.name,
        n = stages.len(),
        location = event.location,
        context = stage_context(event, stages)?,
        limit = limit_min_per_km,
    ))
}

/// Brukerens ønsker for en treningsplan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub weeks: u32,
    pub level: String,
    pub target_pace_min_per_km: f64,
}

pub fn training_plan_prompt(req: &PlanRequest, event: &RaceEvent, summary: &DatasetSummary) -> String {
    format!(
        "Genera un plan de entrenamiento de {weeks} semanas para {name}.

Perfil del corredor:
- Nivel actual: {level}
- Objetivo de pace: {pace} min/km
- Etapas a completar: {stages} días consecutivos, ~{km}km totales, +{gain}m desnivel

Estructura el plan por semanas con:
1. Objetivo de la semana
2. Días de entrenamiento (tipo y duración)
3. Desnivel acumulado semanal objetivo
4. Punto clave a trabajar

Sé específico y progresivo. Considera que necesitan entrenar:
- Resistencia aeróbica
- Fuerza en piernas
- Técnica de subida/bajada
- Adaptación a desnivel acumulado
",
        weeks = req.weeks,
        name = event.name,
        level = req.level,
        pace = req.target_pace_min_per_km,
        stages = summary.stage_count,
        km = summary.total_distance_km,
        gain = summary.total_elevation_gain_m,
    )
}

/// Rådgivertjenesten: bygger forespørsler fra datasettet og gjør feil om til tekst.
pub struct Advisor<'a, P: AdvisoryProvider> {
    provider: P,
    dataset: &'a Dataset,
    settings: AdvisoryConfig,
    time_limit_min_per_km: f64,
}

impl<'a, P: AdvisoryProvider> Advisor<'a, P> {
    pub fn new(provider: P, dataset: &'a Dataset, config: &AnalyzerConfig) -> Self {
        Self {
            provider,
            dataset,
            settings: config.advisory.clone(),
            time_limit_min_per_km: config.time_limit_min_per_km,
        }
    }

    /// Konfig fra løpets egen tidsgrense, overstyrt av miljøet (`ELCRUCE_*`).
    pub fn for_dataset(provider: P, dataset: &'a Dataset) -> Self {
        let config = AnalyzerConfig::for_event(dataset.event()).apply_env();
        Self::new(provider, dataset, &config)
    }

    /// Systemprompt + historikk + nytt spørsmål.
    pub fn build_chat_request(
        &self,
        question: &str,
        history: &[ChatMessage],
    ) -> MetricsResult<CompletionRequest> {
        let system = system_prompt(
            self.dataset.event(),
            self.dataset.stages(),
            self.time_limit_min_per_km,
        )?;
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(question));
        Ok(CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            temperature: self.settings.temperature,
            max_tokens: self.settings.chat_max_tokens,
        })
    }

    pub fn build_plan_request(&self, req: &PlanRequest) -> MetricsResult<CompletionRequest> {
        let context = stage_context(self.dataset.event(), self.dataset.stages())?;
        let prompt = training_plan_prompt(req, self.dataset.event(), &self.dataset.summary());
        Ok(CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage::system(context), ChatMessage::user(prompt)],
            temperature: self.settings.temperature,
            max_tokens: self.settings.plan_max_tokens,
        })
    }

    fn run(&self, kind: AdvisoryKind, request: MetricsResult<CompletionRequest>, prefix: &str) -> String {
        record_advisory_request(kind);
        let result = request
            .map_err(|e| e.to_string())
            .and_then(|r| {
                log::debug!(
                    "advisory {}: model={} messages={}",
                    kind.as_str(),
                    r.model,
                    r.messages.len()
                );
                self.provider.complete(&r).map_err(|e| e.to_string())
            });
        match result {
            Ok(text) => text,
            Err(e) => {
                record_advisory_failure(kind);
                log::warn!("advisory {} feilet: {e}", kind.as_str());
                format!("{prefix}: {e}")
            }
        }
    }

    /// Svar på et spørsmål gitt tidligere historikk. Feil gir en feiltekst.
    pub fn ask(&self, question: &str, history: &[ChatMessage]) -> String {
        self.run(
            AdvisoryKind::Chat,
            self.build_chat_request(question, history),
            "Error al generar respuesta",
        )
    }

    /// Som [`Advisor::ask`], men oppdaterer samtalen med spørsmål og svar.
    pub fn chat(&self, conversation: &mut Conversation, question: &str) -> String {
        let answer = self.ask(question, conversation.messages());
        conversation.push(ChatMessage::user(question));
        conversation.push(ChatMessage::assistant(answer.clone()));
        answer
    }

    pub fn training_plan(&self, req: &PlanRequest) -> String {
        self.run(AdvisoryKind::Plan, self.build_plan_request(req), "Error al generar plan")
    }
}
