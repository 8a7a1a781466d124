pub mod export;
pub mod extract;
pub mod run;
pub mod stats;
pub mod view;
