//! Session error type.
//!
//! Every fallible operation returns a `SessionError`. The kinds mirror the
//! failure modes of the four session operations; each kind maps to a stable
//! process exit code so scripts can distinguish usage problems from data
//! problems:
//!
//! - 2: input/usage (bad file, bad schema, malformed date input)
//! - 3: data/model (training failures, missing prerequisites)
//! - 4: runtime (terminal/rendering failures)

#[derive(Clone)]
pub enum SessionError {
    /// Bad or missing input file, or a schema/value problem during load.
    Load(String),
    /// Training failed (absent dataset, unparseable dates, bad values,
    /// unsolvable system).
    Train(String),
    /// Predict was called before a model was trained.
    NotTrained,
    /// Malformed date input at predict time.
    Parse(String),
    /// Chart was requested before any data was loaded.
    NoData,
    /// Terminal/TUI runtime failure.
    Terminal(String),
}

impl SessionError {
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load(message.into())
    }

    pub fn train(message: impl Into<String>) -> Self {
        Self::Train(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Load(_) | Self::Parse(_) => 2,
            Self::Train(_) | Self::NotTrained | Self::NoData => 3,
            Self::Terminal(_) => 4,
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(msg) => write!(f, "Load failed: {msg}"),
            Self::Train(msg) => write!(f, "Train failed: {msg}"),
            Self::NotTrained => write!(f, "No trained model. Train before predicting."),
            Self::Parse(msg) => write!(f, "Invalid input: {msg}"),
            Self::NoData => write!(f, "No data loaded. Load a CSV first."),
            Self::Terminal(msg) => write!(f, "Terminal error: {msg}"),
        }
    }
}

impl std::fmt::Debug for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionError({self}, exit_code={})", self.exit_code())
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_kind() {
        assert_eq!(SessionError::load("x").exit_code(), 2);
        assert_eq!(SessionError::parse("x").exit_code(), 2);
        assert_eq!(SessionError::train("x").exit_code(), 3);
        assert_eq!(SessionError::NotTrained.exit_code(), 3);
        assert_eq!(SessionError::NoData.exit_code(), 3);
        assert_eq!(SessionError::terminal("x").exit_code(), 4);
    }
}
