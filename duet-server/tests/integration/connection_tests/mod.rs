mod test_single_client_joins_room;
