//! Configuration module

mod site;

pub use site::HeadingStyle;
pub use site::SiteConfig;
