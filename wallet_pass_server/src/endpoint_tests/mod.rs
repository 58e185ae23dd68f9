mod mocks;
mod wallet;
