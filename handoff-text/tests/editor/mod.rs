mod commands;
mod properties;
