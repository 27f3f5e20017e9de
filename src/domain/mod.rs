//! Domain layer - site content entities and the traits infrastructure implements

pub mod cache;
pub mod clock;
pub mod contact;
pub mod content;
pub mod credentials;
pub mod error;
pub mod fallback;
pub mod image;
pub mod location;
pub mod sheet;
pub mod slug;

pub use cache::CacheEntry;
pub use clock::{Clock, ManualClock, SystemClock};
pub use contact::{validate_contact_form, ContactForm, ContactSubmission};
pub use content::{group_keypoints, City, Keypoint, KeypointSection, State};
pub use credentials::{AccessToken, AccessTokenProvider, ServiceAccountCredentials};
pub use error::DomainError;
pub use fallback::{first_success, ChainExhausted};
pub use image::{ImageProvider, ImageSearchOutcome, ImageSource};
pub use location::{Location, LocationEnvironment, LocationSource};
pub use sheet::{AppendAck, Record, SheetStore};
