pub mod address_resolver;
