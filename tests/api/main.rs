mod helpers;
mod hello;
mod roster;
