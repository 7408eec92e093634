mod discovery_steps;
mod messaging_steps;
