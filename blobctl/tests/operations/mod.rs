mod build;
mod download;
mod scenario;
mod upload;
