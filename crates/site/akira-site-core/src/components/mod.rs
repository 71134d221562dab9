//! The site's components.

pub mod demo;
pub mod footer;
pub mod hero;
pub mod home;
pub mod navbar;

pub use demo::AnimationDemo;
pub use footer::Footer;
pub use hero::HeroSection;
pub use home::HomePage;
pub use navbar::Navbar;
pub use quick_test::QuickTest;
