pub mod resource;
pub mod session;
pub mod auth;
pub mod mall;
pub mod shop;
pub mod coupon;
pub mod offer;
pub mod user;
pub mod dashboard;

pub use resource::{
    DeletePolicy, Editable, ListPolicy, PaginationMode, Payload, Reference, Referenced, Resource,
    ResourceKind, SearchMode,
};
pub use session::Session;
pub use auth::{LoginRequest, LoginResponse};
pub use mall::{Coordinates, Mall, MallPayload, MallRef};
pub use shop::{Shop, ShopPayload, ShopRef};
pub use coupon::{Coupon, CouponPayload};
pub use offer::{Offer, OfferPayload};
pub use user::{ProfilePayload, User};
pub use dashboard::{ActivityEntry, DashboardStats, MallShopCount};
