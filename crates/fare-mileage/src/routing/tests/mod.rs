mod common;
mod equalization;
mod is_in_loc;
