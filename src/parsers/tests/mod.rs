mod card_tests;
