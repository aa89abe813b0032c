pub mod class_switch;

pub mod classes;

pub mod notifications;

pub use class_switch::configure_class_switch_routes;
pub use classes::configure_classes_routes;
pub use notifications::configure_notification_routes;
