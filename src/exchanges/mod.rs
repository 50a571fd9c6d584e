pub mod cryptocom;
