pub mod card;
pub mod submit_button;
pub mod text_field;
pub mod toast;
pub mod verification_slot;
pub mod waitlist_form;

pub use card::*;
pub use submit_button::*;
pub use text_field::*;
pub use toast::*;
pub use verification_slot::*;
pub use waitlist_form::*;
