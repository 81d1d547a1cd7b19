mod connection_steps;
mod correlation_steps;
mod frame_steps;
mod session_steps;
