//! AWS adapters over the query protocol.

pub mod credentials;
pub mod ec2;
pub mod query;
pub mod sigv4;
pub mod sns;

pub use credentials::{CredentialSource, CredentialsProvider};
pub use ec2::Ec2Client;
pub use sigv4::{AwsCredentials, SigV4Signer};
pub use sns::SnsPublisher;
