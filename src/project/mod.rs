mod foundry;

pub use foundry::FoundryProject;
