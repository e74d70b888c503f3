mod frame;
mod sink;
