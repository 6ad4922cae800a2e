use thiserror::Error;

/// Feil fra metrikkmotoren. Alle er kontraktsbrudd og returneres rett til kaller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    /// Høydeprofilen har færre enn to punkter, er ikke strengt stigende,
    /// eller etappen bryter en annen datainvariant.
    #[error("ugyldig profil: {0}")]
    InvalidProfile(String),
    /// Distansen er null eller negativ der den brukes som divisor.
    #[error("divisjon med null: {0}")]
    DivisionByZero(&'static str),
    /// Sammenligning/aggregat kalt uten etapper.
    #[error("tom input: {0}")]
    EmptyInput(&'static str),
    /// Ikke-endelige tall (NaN/inf) i input.
    #[error("ugyldig input: {0}")]
    InvalidInput(String),
}

pub type MetricsResult<T> = Result<T, MetricsError>;
