mod attribution;
mod browsing;
mod persistence;
mod queries;
