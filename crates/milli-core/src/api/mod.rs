pub mod mojang;
