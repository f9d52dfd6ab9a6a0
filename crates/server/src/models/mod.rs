//! Domain types shared between repositories, services, and route handlers.

pub mod delivery;
pub mod movement;
pub mod notification;
pub mod product;
pub mod staff;

pub use delivery::{Delivery, ScheduleDeliveryInput};
pub use movement::{Movement, MovementInput, MovementValidationError, MovementWithContext};
pub use notification::Notification;
pub use product::{CreateProductInput, Product, UpdateProductInput};
pub use staff::{CurrentStaff, StaffMember, session_keys};
