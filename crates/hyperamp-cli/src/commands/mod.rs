pub mod amplify;
pub mod profile;
