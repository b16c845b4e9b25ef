//! Configuration module

mod site;

pub use site::AvatarConfig;
pub use site::SiteConfig;
pub use site::SocialConfig;
