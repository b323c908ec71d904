//! Email form: dual-mode input (pasted text or uploaded file).

pub mod input;
pub mod reconciler;

pub use input::{InputState, NormalizedPayload, SelectedFile};
pub use reconciler::{FileControl, InputReconciler, InteractionPolicy};
