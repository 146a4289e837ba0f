mod game;
mod health;
mod room;
