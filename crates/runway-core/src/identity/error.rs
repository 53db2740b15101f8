use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("no valid runner id after {attempts} attempts")]
    Exhausted { attempts: u32 },
}
