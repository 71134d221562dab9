use thiserror::Error;

use crate::app::MountId;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("no mounted component with id {0:?}")]
    NotMounted(MountId),
}
