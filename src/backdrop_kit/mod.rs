pub mod area_average;
pub mod backend;
pub mod encode;
pub mod gaussian;
pub mod placement;
pub mod random_color;
pub mod recolor;
pub mod tools;
pub mod wallpaper;
