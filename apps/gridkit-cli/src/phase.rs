use std::fmt;
use std::str::FromStr;

/// Phase this build ships as.
const BUILT_AS: ReleasePhase = ReleasePhase::Development;

/// Development phase of a GridKit build.
///
/// Anything other than `Production` triggers a startup warning. The phase is
/// baked in at build time and can be overridden once at startup through the
/// `GRIDKIT_PHASE` environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleasePhase {
    Testing,
    Development,
    Production,
}

impl ReleasePhase {
    /// Phase for this process: `GRIDKIT_PHASE` if set and recognized,
    /// otherwise the built-in default. Read once at startup.
    pub fn current() -> Self {
        match std::env::var("GRIDKIT_PHASE") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "unrecognized GRIDKIT_PHASE, keeping built-in phase");
                BUILT_AS
            }),
            Err(_) => BUILT_AS,
        }
    }

    /// Whether this phase warrants a "not for production" warning.
    pub fn warns(self) -> bool {
        self != Self::Production
    }
}

impl fmt::Display for ReleasePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Testing => "testing",
            Self::Development => "development",
            Self::Production => "production",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPhase(String);

impl fmt::Display for UnknownPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown release phase `{}`", self.0)
    }
}

impl std::error::Error for UnknownPhase {}

impl FromStr for ReleasePhase {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "testing" => Ok(Self::Testing),
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            _ => Err(UnknownPhase(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        for phase in [
            ReleasePhase::Testing,
            ReleasePhase::Development,
            ReleasePhase::Production,
        ] {
            assert_eq!(phase.to_string().parse::<ReleasePhase>(), Ok(phase));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("PRODUCTION".parse(), Ok(ReleasePhase::Production));
    }

    #[test]
    fn unknown_phase_is_rejected() {
        assert!("beta".parse::<ReleasePhase>().is_err());
    }

    #[test]
    fn only_production_is_silent() {
        assert!(ReleasePhase::Testing.warns());
        assert!(ReleasePhase::Development.warns());
        assert!(!ReleasePhase::Production.warns());
    }
}
