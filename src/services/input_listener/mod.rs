mod dry_input_listener;
mod evdev_listener;
mod modifier_state;
mod translator;
mod r#trait;

pub use self::modifier_state::ModifierState;
pub use self::r#trait::{create_input_listener, InputListenerTrait};
pub use self::translator::{translate, REL_WHEEL};
