pub mod check;
pub mod replace;
pub mod run;
pub mod template;
