use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("compile mode requires an external template compiler, but none is configured")]
    CompilerNotConfigured,

    #[error("failed to compile template '{path}': {message}")]
    Compile { path: String, message: String },
}
