use crate::command::UnknownCommand;
use crate::Command;
use thiserror::Error;

pub type Result<T, E = PhraseTableError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PhraseTableError {
    #[error("invalid phrase table yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    UnknownCommand(#[from] UnknownCommand),
    #[error("the no-match sentinel cannot carry trigger phrases")]
    SentinelCommand,
    #[error("command {0} has no usable phrases")]
    EmptyPhraseList(Command),
}
