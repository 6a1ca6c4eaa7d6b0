mod conversation;
mod knowledge;
