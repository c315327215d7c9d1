/// Contains the kubectl client.
pub mod client;
