mod helpers;

mod admin_user_test;
mod review_test;
mod session_test;
