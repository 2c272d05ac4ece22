mod confirm;
mod controller;

pub use self::confirm::ConfirmGate;
pub use self::controller::{LifecycleController, ModalState, OpKind, OpOutcome};
