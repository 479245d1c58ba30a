pub mod analysis;
pub mod compliance;
pub mod ground;
pub mod material;
pub mod moisture;
pub mod resistance;
pub mod surface;
pub mod temperature;
pub mod u_value;
pub mod units;
pub mod vapour;
