use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("no such class: {0}")]
    NoSuchClass(String),

    #[error("no instance named: {0}")]
    NoInstance(String),

    #[error("no method {method} in class {class}")]
    NoMethod { class: String, method: String },

    #[error("could not invoke constructor for {class}: {detail}")]
    ConstructorFailed { class: String, detail: String },
}
