pub mod default_route;
pub mod scout_route;
