/// Contains the helm client.
pub mod client;
