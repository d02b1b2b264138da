mod integration;
mod metadata;
