mod azure_cli;
mod static_provider;
