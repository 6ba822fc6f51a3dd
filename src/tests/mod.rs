
mod profile_flow;
