//! 贴图制作向导
//!
//! - `types`: 步骤、提示与会话状态
//! - `controller`: 驱动各步骤的控制器

pub mod controller;
pub mod types;

pub use controller::WizardController;
pub use types::{Notice, NoticeLevel, SessionState, WizardStep};
