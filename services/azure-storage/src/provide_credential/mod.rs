mod static_provider;
pub use static_provider::StaticCredentialProvider;

mod azure_cli;
pub use azure_cli::AzureCliCredentialProvider;
