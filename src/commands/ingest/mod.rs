mod run;
mod source;

pub use run::run;
