#[cfg(test)]
mod common;


#[cfg(test)]
mod signup_post_tests;

#[cfg(test)]
mod widget_flow_tests;
