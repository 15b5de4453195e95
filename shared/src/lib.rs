// Wire formats shared by the Drive adapter and the credential store

pub mod credentials;
pub mod protocol;
