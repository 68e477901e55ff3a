mod test_backlog_replay;
mod test_broadcast_fallback;
