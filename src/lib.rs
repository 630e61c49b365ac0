pub mod assets;
pub mod autopilot;
pub mod bullet;
pub mod cluster;
pub mod config;
pub mod entities;
pub mod fire;
pub mod game;
pub mod input;
pub mod player;
pub mod pool;
pub mod quadtree;
pub mod scenery;
pub mod surface;
pub mod turret;
