pub mod entity;
pub mod hymn;
pub mod member;
pub mod organization;
pub mod permission;
pub mod reference;
pub mod relation;
pub mod sacrament_meeting;
pub mod user;
