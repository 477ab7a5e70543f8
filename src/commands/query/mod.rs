mod advisor;
mod attribute;
mod intent;
mod monster_index;
mod output;
mod ranking;
mod run;
mod segment;
mod vocabulary;

pub(crate) use run::run;
