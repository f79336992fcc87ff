mod provider_data_tests;
