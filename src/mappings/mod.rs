pub mod key_display_name;

pub use key_display_name::KeyDisplayName;
