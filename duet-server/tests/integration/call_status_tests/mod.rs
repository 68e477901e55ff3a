mod test_call_status_versioning;
