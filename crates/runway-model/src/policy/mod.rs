mod provisioning;
pub use provisioning::ProvisioningPolicy;

mod tls;
pub use tls::TlsPolicy;
